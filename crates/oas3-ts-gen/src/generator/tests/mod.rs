mod parameters;
mod resolver;
mod sorter;
mod support;
