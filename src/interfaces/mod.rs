//! Interface adapters: the CSV script reader and report writer.

pub mod csv;
