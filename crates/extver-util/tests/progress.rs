use extver_util::progress::{format_status, StatusKind};

#[test]
fn test_status_label_is_right_aligned() {
    console::set_colors_enabled(false);
    let line = format_status(StatusKind::Action, "Rewrote", "org.example:core");
    assert_eq!(line, "     Rewrote org.example:core");
}

#[test]
fn test_long_label_is_not_truncated() {
    console::set_colors_enabled(false);
    let line = format_status(StatusKind::Warn, "VeryLongStatusLabel", "x");
    assert!(line.starts_with("VeryLongStatusLabel x"));
}
