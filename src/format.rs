// SPDX-License-Identifier: CC0-1.0

mod decode;
mod encode;

pub use decode::decode;
pub use encode::{encode, encode_error};
