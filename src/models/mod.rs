pub mod t5;
