//! Integration test for the `validate` command.
use demeter::cli::handle_validate_command;
use demeter::log::is_logger_initialised;
use demeter::settings::Settings;
use std::path::Path;

/// Validate the bundled example model, checking that the logger comes up along the way.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("DEMETER_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    let model_dir = Path::new("models").join("simple");
    handle_validate_command(&model_dir, Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
