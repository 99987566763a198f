pub mod alarm;
pub mod announcer;
pub mod clist;
pub mod filter;
pub mod health;
pub mod publisher;
