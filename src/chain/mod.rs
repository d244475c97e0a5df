pub mod amount;

pub type Address = alloy_primitives::Address;
pub type Amount = alloy_primitives::U256;
