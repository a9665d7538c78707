#[path = "../test_utils.rs"]
mod test_utils;

mod availability_test;
mod exception_test;
mod jobs_test;
mod middleware_test;
