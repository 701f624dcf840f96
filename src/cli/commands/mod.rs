mod check;
mod init;
mod run;

pub use check::execute_check;
pub use init::execute_init;
pub use run::execute_run;
