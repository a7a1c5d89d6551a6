pub mod common;

mod locale_api_test;
