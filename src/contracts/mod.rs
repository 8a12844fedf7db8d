//! Contract bindings for the rescue targets

pub mod escrow_vault;
pub mod ve_nft;

pub use escrow_vault::*;
pub use ve_nft::*;
