pub mod yao_2pc;
