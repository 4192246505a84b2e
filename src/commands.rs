pub mod help;
pub mod map;

pub use self::{
    help::help,
    map::map,
};
