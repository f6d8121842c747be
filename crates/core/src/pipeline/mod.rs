pub mod identify_face_use_case;
