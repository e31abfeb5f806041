pub mod html;
pub mod response;
