pub mod frame_input;
pub mod viewport;

/// Short status line for the HUD.
pub fn format_health_line(current: f32, max: f32) -> String {
    format!("HP {:.0}/{:.0}", current.max(0.0), max)
}
