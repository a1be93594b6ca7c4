/// Format an epoch-millis timestamp as a UTC axis label.
///
/// The stream ticks every 100 ms, so labels carry seconds: `HH:MM:SS`.
pub fn format_time_label(timestamp: u64) -> String {
    let total_secs = timestamp / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}
