pub mod area;
pub mod case;
pub mod category;
pub mod group;
pub mod selection;
