mod common;
mod features;
mod routing;
