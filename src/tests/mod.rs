mod correctness;
mod model;
