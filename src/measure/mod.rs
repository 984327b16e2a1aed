pub(crate) mod markup;
pub(crate) mod surface;
pub(crate) mod text;
