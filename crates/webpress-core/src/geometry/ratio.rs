/// Greatest common divisor. `gcd(0, n) == n`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Reduce `w:h` to lowest terms, e.g. `1920x1080 -> 16:9`.
///
/// Inputs are rounded to whole pixels first. Anything that does not round to
/// a positive size yields `1:1`.
pub fn simplify(w: f64, h: f64) -> (u32, u32) {
    if !(w > 0.0 && h > 0.0) {
        return (1, 1);
    }
    let rw = w.round().min(u32::MAX as f64) as u64;
    let rh = h.round().min(u32::MAX as f64) as u64;
    if rw == 0 || rh == 0 {
        return (1, 1);
    }
    let d = gcd(rw, rh);
    ((rw / d) as u32, (rh / d) as u32)
}
