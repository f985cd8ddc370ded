pub mod face_box;
pub mod face_embedder;
pub mod face_locator;
pub mod face_verifier;
pub mod verification_outcome;
