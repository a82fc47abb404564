mod assembly_editor;

fn main() {
    assembly_editor::editor::run();
}
