mod upload;
mod value;

pub use upload::FileHandle;
pub use value::Value;
