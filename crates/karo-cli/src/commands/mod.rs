pub mod add;
pub mod auth;
pub mod edit;
pub mod list;
pub mod status;

#[cfg(test)]
mod testing;
