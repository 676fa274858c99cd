//! Exact currency arithmetic and input normalization

mod amount;
pub mod normalize;

pub use amount::{percent, round_half_up, safe_div, Amount, AMOUNT_LIMIT, CENT_SCALE, ROUNDING};
pub use normalize::{
    normalize_amount, normalize_count, normalize_decimal, normalize_fixed, normalize_non_negative, RawNumber,
    MAX_INPUT_MAGNITUDE,
};
