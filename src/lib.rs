pub mod ast;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod native;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod runner;
pub mod scanner;
pub mod stack;
pub mod token;
pub mod value;
