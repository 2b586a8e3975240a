pub mod components;
pub mod fragments;
pub mod layouts;
pub mod pages;
pub mod stadium_map;

/// Formats a point total with thousands separators, e.g. `1,250`
pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}
