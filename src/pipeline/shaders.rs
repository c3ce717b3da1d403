pub mod lighting;
pub mod normal;
pub mod solid;
pub mod textured;
pub mod uniform;
