mod lifecycle_test;
mod postgres_test;
mod reference_test;
mod settings_test;
mod test_utils;
