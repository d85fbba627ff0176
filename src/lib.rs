//! Bookshelf application library: the books module and its registration.

pub mod modules;
