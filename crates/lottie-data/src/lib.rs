// lottie-data: Serde structs for Lottie / TGS JSON
pub mod model;
