pub mod paydock;
pub use self::paydock::Paydock;
