mod content;
mod error;
mod file;
mod fs;
mod path;
mod tree;


pub use self::{
    content::ContentBuffer,
    error::{Error, FileOperation},
    file::MemoryFile,
    fs::MemoryFS,
};
