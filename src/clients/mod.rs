pub mod cloudinary;
pub mod gemini;
pub mod huggingface;
