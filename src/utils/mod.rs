//! Utility modules shared across normalizers
//!
//! - JSON fields: lenient typed access over untrusted model output

pub mod json_fields;

// Re-export commonly used helpers
pub use json_fields::{
    get_array, get_bool, get_f64, get_object, get_percent, get_str, get_str_list, get_string,
    get_text, get_text_capped, get_text_list, truncate_chars,
};
