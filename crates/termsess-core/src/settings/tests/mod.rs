// Settings test module
#[cfg(test)]
mod accessors_tests;
#[cfg(test)]
mod codec_tests;
#[cfg(test)]
mod schema_tests;
