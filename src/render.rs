pub(crate) mod composite;
pub(crate) mod encode;
pub(crate) mod pipeline;
pub(crate) mod surface;
pub(crate) mod track;
