pub mod flash;
pub mod request_card;
pub mod toast;
