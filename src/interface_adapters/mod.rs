// Interface adapters: battle API client and presentation adapters.

pub mod animation;
pub mod clients;
pub mod protocol;
