// Resume parsing seam consumed by the job matcher.

pub mod parser;
