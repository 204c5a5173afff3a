mod cli_test;
mod environment_test;
mod settings_test;
