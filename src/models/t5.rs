// T5 encoder/decoder model for English-to-SQL translation
use candle::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{self, T5ForConditionalGeneration};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use log::info;
use tokenizers::Tokenizer;

use crate::error::InferError;
use crate::registry::SqlGenerator;

const PROMPT_TEMPLATE: &str = "translate English to SQL: ";
const EOS_MARKER: &str = "</s>";
const SEED: u64 = 42;
// Safety cap; well-behaved models emit EOS long before this.
const MAX_OUTPUT_TOKENS: usize = 512;

/// The prompt the model sees, byte-exact:
/// `"translate English to SQL: " + question + " </s>"`.
pub fn build_prompt(question: &str) -> String {
    format!("{PROMPT_TEMPLATE}{question} {EOS_MARKER}")
}

/// Drop the decoder-start token at the front and the EOS at the back of a
/// generated sequence. A sequence shorter than 2 has no payload between the
/// sentinels and is reported as a generation failure rather than sliced
/// out of bounds.
pub fn strip_sentinel_tokens(ids: &[u32]) -> Result<&[u32], InferError> {
    if ids.len() < 2 {
        return Err(InferError::Generation(anyhow::anyhow!(
            "generated sequence of {} tokens is too short to strip sentinels",
            ids.len()
        )));
    }
    Ok(&ids[1..ids.len() - 1])
}

pub struct T5InferenceModel {
    model: T5ForConditionalGeneration,
    tokenizer: Tokenizer,
    config: t5::Config,
    device: Device,
}

impl T5InferenceModel {
    pub fn load_from_hub(
        model_id: &str,
        revision: Option<&str>,
        device: Device,
    ) -> anyhow::Result<Self> {
        let revision = revision.unwrap_or("main");
        let api = Api::new()?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        info!("loading {model_id} tokenizer");
        let tokenizer_filename = repo.get("tokenizer.json")?;
        let tokenizer = Tokenizer::from_file(tokenizer_filename).map_err(anyhow::Error::msg)?;
        info!("{model_id} tokenizer loaded");

        info!("loading {model_id} model");
        let config_filename = repo.get("config.json")?;
        let config: t5::Config = serde_json::from_slice(&std::fs::read(config_filename)?)?;
        let weights_filename = repo.get("model.safetensors")?;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_filename], DType::F32, &device)?
        };
        let model = T5ForConditionalGeneration::load(vb, &config)?;
        info!("{model_id} model loaded");

        Ok(Self {
            model,
            tokenizer,
            config,
            device,
        })
    }

    /// Greedy generation. Returns the raw output ids, decoder-start token
    /// first and EOS last.
    fn run_generation(&self, prompt: &str) -> anyhow::Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(anyhow::Error::msg)?;
        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;

        // decode() mutates a KV cache, so each request works on its own copy
        // of the model; the weight tensors inside it are shared.
        let mut model = self.model.clone();
        model.clear_kv_cache();
        let encoder_output = model.encode(&input_ids)?;

        let start_id = self
            .config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32;
        let mut output_ids = vec![start_id];
        let mut logits_processor = LogitsProcessor::new(SEED, None, None);

        for index in 0..MAX_OUTPUT_TOKENS {
            let decoder_ids = if index == 0 || !self.config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                Tensor::new(&output_ids[output_ids.len() - 1..], &self.device)?.unsqueeze(0)?
            };
            let logits = model.decode(&decoder_ids, &encoder_output)?.squeeze(0)?;
            let next_id = logits_processor.sample(&logits)?;
            output_ids.push(next_id);
            if next_id as usize == self.config.eos_token_id {
                break;
            }
        }
        Ok(output_ids)
    }
}

impl SqlGenerator for T5InferenceModel {
    fn generate_sql(&self, question: &str) -> Result<String, InferError> {
        let prompt = build_prompt(question);
        let output_ids = self
            .run_generation(&prompt)
            .map_err(InferError::Generation)?;
        let payload = strip_sentinel_tokens(&output_ids)?;
        self.tokenizer
            .decode(payload, false)
            .map_err(|e| InferError::Generation(anyhow::anyhow!(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_has_the_exact_template_form() {
        assert_eq!(
            build_prompt("how many users are there"),
            "translate English to SQL: how many users are there </s>"
        );
    }

    #[test]
    fn prompt_preserves_question_verbatim() {
        let question = "list names where age > 30; -- tricky";
        assert_eq!(
            build_prompt(question),
            format!("translate English to SQL: {question} </s>")
        );
    }

    #[test]
    fn strip_drops_exactly_first_and_last() {
        let ids = [0u32, 100, 200, 1];
        assert_eq!(strip_sentinel_tokens(&ids).unwrap(), &[100, 200]);
    }

    #[test]
    fn strip_of_two_sentinels_leaves_empty_payload() {
        let ids = [0u32, 1];
        assert_eq!(strip_sentinel_tokens(&ids).unwrap(), &[] as &[u32]);
    }

    #[test]
    fn strip_of_short_sequence_is_a_generation_error() {
        for ids in [&[][..], &[0u32][..]] {
            let err = strip_sentinel_tokens(ids).unwrap_err();
            assert!(matches!(err, InferError::Generation(_)));
        }
    }
}
