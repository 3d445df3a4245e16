//! Number formatting for the report protocol

/// Digits after the decimal point for every reported value
pub const FIXED_DECIMALS: usize = 16;

/// Significant digits of the header hyperparameter
const GENERAL_PRECISION: i32 = 6;

/// Fixed notation with 16 decimals: the exact decimal expansion of the
/// binary value, correctly rounded (`1.1` becomes `1.1000000000000001`).
pub fn format_fixed(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    format!("{:.*}", FIXED_DECIMALS, value)
}

/// Shortest-form rendering with 6 significant digits, matching C's `%g`:
/// fixed notation for exponents in `[-4, 6)`, scientific otherwise, trailing
/// zeros removed.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first; the exponent after rounding
    // decides the notation.
    let scientific = format!("{:.*e}", (GENERAL_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .map(|(m, e)| (m, e.parse::<i32>().unwrap_or_default()))
        .unwrap_or((scientific.as_str(), 0));

    if exponent < -4 || exponent >= GENERAL_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (GENERAL_PRECISION - 1 - exponent) as usize;
        trim_fraction_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
