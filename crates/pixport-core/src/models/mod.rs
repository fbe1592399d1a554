pub mod response;
pub mod upload;

pub use response::{
    ApiResponse, DeleteImageData, ImagesData, ProfilePhotoData, SignatureData, UploadedImage,
};
pub use upload::UploadKind;
