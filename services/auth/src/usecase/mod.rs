pub mod otp;
pub mod user;
pub mod verify;
