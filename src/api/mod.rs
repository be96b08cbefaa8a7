pub mod presence;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;
