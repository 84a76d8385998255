pub mod io;
pub mod resolve;
pub mod shell;
