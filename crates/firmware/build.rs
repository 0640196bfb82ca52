fn main() -> std::io::Result<()> {
    // Linker script setup is only needed for hardware builds
    #[cfg(feature = "hardware")]
    {
        use std::env;
        use std::fs;
        use std::path::PathBuf;

        // Put `memory.x` (FLASH, RAM and AXISRAM in AXI SRAM, plus the .axisram tile arena
        // section) in OUT_DIR and ensure it's on the linker search path.
        let out = PathBuf::from(env::var_os("OUT_DIR").unwrap_or_default());
        fs::write(out.join("memory.x"), include_bytes!("../../memory.x"))?;

        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
