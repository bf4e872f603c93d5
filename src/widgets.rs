mod preview;

pub use self::preview::PicturePreviewWidget;
