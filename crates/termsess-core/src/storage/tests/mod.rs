#[cfg(test)]
mod document_tests;
#[cfg(test)]
mod memory_tests;
#[cfg(test)]
mod naming_tests;
