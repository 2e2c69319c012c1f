mod batch_tests;
mod transport_tests;
