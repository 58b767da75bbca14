mod office_tests;
mod utils;
