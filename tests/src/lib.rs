#[cfg(test)]
mod util;

#[cfg(test)]
mod extraction;
#[cfg(test)]
mod pipeline;
#[cfg(all(test, unix))]
mod probe_process;
