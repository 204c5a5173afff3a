mod content_structurer_test;
mod formula_normalizer_test;
