/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Reverse positions `i..=j` of `order` in place (2-opt move).
pub fn two_opt_swap(order: &mut [usize], i: usize, j: usize) {
    order[i..=j].reverse();
}

/// Render a tour as `a -> b -> c` for logs.
pub fn format_order(ids: &[String]) -> String {
    ids.join(" -> ")
}

/// At most `max_chars` leading characters of `text`, cut on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
