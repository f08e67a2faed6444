pub const BP_PER_MBP: f64 = 1_000_000.0;

/// Chromosome names in natural order, chr2 before chr10
pub fn sort_alphanumeric<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_by(|a, b| alphanumeric_sort::compare_str(a, b));
    names
}

pub fn to_mbp(pos: u64) -> f64 {
    pos as f64 / BP_PER_MBP
}

/// Matplotlib's `cool` colormap, `t` is clamped to `[0, 1]`
pub fn cool_color(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let red = (t * 255.0).round() as u8;
    let green = ((1.0 - t) * 255.0).round() as u8;
    format!("#{red:02x}{green:02x}ff")
}
