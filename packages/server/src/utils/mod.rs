pub mod classroom_code;
pub mod cookies;
