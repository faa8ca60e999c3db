pub mod uci;
pub mod uci_parser;
