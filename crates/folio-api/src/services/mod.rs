pub mod upload_gate;

pub use upload_gate::UploadGate;
