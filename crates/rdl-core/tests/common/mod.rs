pub mod sh_tools;
